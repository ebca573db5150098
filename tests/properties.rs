//! Property tests for the calculation invariants.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use textile_billing::calculation::{
    AggregationOptions, RateSource, aggregate_challans, allocate_deduction,
    calculate_invoice_totals, calculate_payslip,
};
use textile_billing::models::{
    AttendanceRecord, AttendanceStatus, Challan, ChallanStatus, DeductionPolicy, Employee,
    EmployeeAdvance, InvoiceType, PayPeriod, TaxRates, TaxType,
};

struct MasterOnly;

impl RateSource for MasterOnly {
    fn client_rate(&self, _process: &str) -> Option<Decimal> {
        None
    }

    fn master_rate(&self, process: &str) -> Option<Decimal> {
        match process {
            "DYEING" => Some(Decimal::new(3, 0)),
            "BLEACHING" => Some(Decimal::new(15, 1)),
            "PRINTING" => Some(Decimal::new(425, 2)),
            _ => None,
        }
    }
}

const PROCESSES: [&str; 4] = ["DYEING", "BLEACHING", "PRINTING", "WASHING"];

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

fn status_from(index: u8) -> AttendanceStatus {
    match index % 4 {
        0 => AttendanceStatus::Present,
        1 => AttendanceStatus::Absent,
        2 => AttendanceStatus::Leave,
        _ => AttendanceStatus::Holiday,
    }
}

prop_compose! {
    fn arb_challan(index: usize)(
        process in 0usize..PROCESSES.len(),
        design in 0u8..3,
        pcs in 0u64..50,
        tenths in 0i64..100_000,
    ) -> Challan {
        Challan {
            challan_number: format!("DC-{}", index),
            date: base_date(),
            party_name: "Shree Textiles".to_string(),
            process: vec![PROCESSES[process].to_string()],
            split_process: None,
            design_no: format!("D-{}", design),
            pcs,
            mtr: Decimal::new(tenths, 1),
            status: ChallanStatus::ReadyToInvoice,
            remarks: None,
        }
    }
}

fn arb_challans() -> impl Strategy<Value = Vec<Challan>> {
    (0usize..12).prop_flat_map(|n| (0..n).map(arb_challan).collect::<Vec<_>>())
}

fn options(invoice_type: InvoiceType, tax_type: TaxType) -> AggregationOptions<'static> {
    AggregationOptions {
        invoice_type,
        tax_type,
        hsn_code: "998821",
        tax_rates: TaxRates::default(),
    }
}

proptest! {
    #[test]
    fn total_is_whole_and_round_off_at_most_half(
        challans in arb_challans(),
        gst in any::<bool>(),
    ) {
        let tax_type = if gst { TaxType::Gst } else { TaxType::Ngst };
        let items = aggregate_challans(&challans, &MasterOnly, &options(InvoiceType::Process, tax_type), 1).items;
        let totals = calculate_invoice_totals(&items, 1).totals;

        prop_assert_eq!(totals.total_amount, totals.total_amount.trunc());
        prop_assert!(totals.rounded_off.abs() <= Decimal::new(5, 1));
        prop_assert_eq!(
            totals.total_amount,
            totals.sub_total + totals.total_tax_amount + totals.rounded_off
        );
        if !gst {
            prop_assert_eq!(totals.total_tax_amount, Decimal::ZERO);
        }
    }

    #[test]
    fn aggregation_conserves_meters_and_pieces(
        challans in arb_challans(),
        design_wise in any::<bool>(),
    ) {
        let invoice_type = if design_wise { InvoiceType::Design } else { InvoiceType::Process };
        let items = aggregate_challans(&challans, &MasterOnly, &options(invoice_type, TaxType::Gst), 1).items;

        let input_mtr: Decimal = challans.iter().map(|c| c.mtr).sum();
        let output_mtr: Decimal = items.iter().map(|i| i.mtr).sum();
        let input_pcs: u64 = challans.iter().map(|c| c.pcs).sum();
        let output_pcs: u64 = items.iter().map(|i| i.pcs).sum();

        prop_assert_eq!(input_mtr, output_mtr);
        prop_assert_eq!(input_pcs, output_pcs);
        for challan in &challans {
            prop_assert!(items.iter().any(|i| i.contains_challan(&challan.challan_number)));
        }
    }

    #[test]
    fn net_salary_is_gross_minus_deduction(
        halves in prop::collection::vec((0u8..4, 0u8..4, 0i64..50), 0..15),
        requested in 0i64..20_000,
        advance in 1i64..10_000,
    ) {
        let employee = Employee {
            id: "emp_001".to_string(),
            name: "Ramesh".to_string(),
            daily_wage: Decimal::new(500, 0),
            rate_per_meter: Decimal::new(2, 0),
        };
        let period = PayPeriod::new(base_date(), base_date() + Duration::days(14)).unwrap();
        let attendance: Vec<AttendanceRecord> = halves
            .iter()
            .enumerate()
            .map(|(day, (morning, evening, meters))| AttendanceRecord {
                employee_id: "emp_001".to_string(),
                date: base_date() + Duration::days(day as i64),
                morning_status: status_from(*morning),
                evening_status: status_from(*evening),
                morning_overtime_hours: Decimal::ZERO,
                evening_overtime_hours: Decimal::ZERO,
                meters_produced: Decimal::new(*meters, 0),
                created_at: None,
                updated_at: None,
            })
            .collect();
        let advances = vec![EmployeeAdvance {
            id: "adv_1".to_string(),
            employee_id: "emp_001".to_string(),
            date: base_date() - Duration::days(10),
            amount: Decimal::new(advance, 0),
            paid_amount: Decimal::ZERO,
            reason: None,
        }];

        let payslip = calculate_payslip(
            &employee,
            &period,
            &attendance,
            &advances,
            DeductionPolicy::Manual { amount: Decimal::new(requested, 0) },
        )
        .unwrap()
        .payslip;

        prop_assert_eq!(payslip.net_salary, payslip.gross_salary - payslip.advance_deduction);
        prop_assert!(payslip.advance_deduction <= payslip.gross_salary);
        prop_assert!(payslip.advance_deduction <= payslip.outstanding_advance_before);
        prop_assert!(payslip.net_salary >= Decimal::ZERO);
        prop_assert!(payslip.total_working_days <= Decimal::from(attendance.len()));
    }

    #[test]
    fn allocation_never_overpays_an_advance(
        amounts in prop::collection::vec(1i64..5_000, 1..6),
        deduction in 0i64..30_000,
    ) {
        let mut advances: Vec<EmployeeAdvance> = amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| EmployeeAdvance {
                id: format!("adv_{}", i),
                employee_id: "emp_001".to_string(),
                date: base_date() + Duration::days(i as i64),
                amount: Decimal::new(*amount, 0),
                paid_amount: Decimal::ZERO,
                reason: None,
            })
            .collect();
        let deduction = Decimal::new(deduction, 0);

        let allocation = allocate_deduction("emp_001", deduction, &mut advances);

        let applied: Decimal = allocation.repayments.iter().map(|r| r.applied).sum();
        prop_assert_eq!(applied + allocation.unallocated, deduction);
        for advance in &advances {
            prop_assert!(advance.paid_amount <= advance.amount);
            prop_assert!(advance.paid_amount >= Decimal::ZERO);
        }
    }
}
