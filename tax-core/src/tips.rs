//! "Tax suggestion of the month", keyed to the Indian fiscal calendar.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyTip {
    pub title: &'static str,
    pub tip: &'static str,
}

/// Returns the tip for a calendar month (1 = January).
///
/// Months without a dedicated tip, and out-of-range values, get the generic
/// tip.
pub fn monthly_tip(month: u32) -> MonthlyTip {
    match month {
        4 => MonthlyTip {
            title: "Start of FY Planning",
            tip: "Plan your 80C investments now to avoid last-minute stress in March!",
        },
        6 => MonthlyTip {
            title: "LTA Claims",
            tip: "Planning a summer vacation? Check your LTA eligibility for tax-free travel reimbursements.",
        },
        9 => MonthlyTip {
            title: "Advance Tax",
            tip: "Ensure your advance tax installments are paid to avoid interest penalties.",
        },
        12 => MonthlyTip {
            title: "Investment Proofs",
            tip: "Payroll will soon ask for investment proofs. Organize your receipts now!",
        },
        3 => MonthlyTip {
            title: "Last Call for Savings",
            tip: "March 31st is the deadline for tax-saving investments. Max out your 80C/80D now!",
        },
        _ => MonthlyTip {
            title: "Tax Efficiency",
            tip: "Review your salary components to ensure you're maximizing HRA and standard deductions.",
        },
    }
}
