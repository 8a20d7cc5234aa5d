//! Performance benchmarks for the Payroll Run Engine.
//!
//! - Single payslip calculation (pure arithmetic and audit trail)
//! - Full payroll runs over the in-memory stores at several directory sizes
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use chrono::NaiveDate;
use rust_decimal_macros::dec;

use payroll_engine::calculation::{PayslipInputs, calculate_payslip};
use payroll_engine::config::{OvertimeConfig, PayrollConfig};
use payroll_engine::engine::PayrollEngine;
use payroll_engine::models::{Employee, NewPayrollPeriod};

/// Benchmark: one payslip calculation.
fn bench_calculate_payslip(c: &mut Criterion) {
    let inputs = PayslipInputs {
        monthly_salary: dec!(5000000),
        workdays: 23,
        attended_days: 21,
        overtime_hours: dec!(7.5),
        reimbursements: dec!(250000.50),
    };
    let overtime = OvertimeConfig::default();

    c.bench_function("calculate_payslip", |b| {
        b.iter(|| black_box(calculate_payslip(black_box(&inputs), &overtime)))
    });
}

/// Seeds a fresh engine, then runs payroll for January 2024.
async fn full_run(employees: u64) {
    let (engine, stores) =
        PayrollEngine::in_memory(PayrollConfig::default()).expect("default config is valid");
    for id in 1..=employees {
        stores
            .directory
            .insert(Employee::new(id, format!("Employee {id}"), dec!(4400000)))
            .await;
    }
    let period = engine
        .periods()
        .create_period(NewPayrollPeriod::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        ))
        .await
        .unwrap();

    let report = engine.periods().run_payroll(period.id).await.unwrap();
    black_box(report);
}

/// Benchmark: full runs across directory sizes.
fn bench_payroll_run(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("payroll_run");

    for employees in [20u64, 100, 500].iter() {
        group.throughput(Throughput::Elements(*employees));
        group.bench_with_input(
            BenchmarkId::new("employees", employees),
            employees,
            |b, &employees| b.to_async(&rt).iter(|| full_run(employees)),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_calculate_payslip, bench_payroll_run);
criterion_main!(benches);
