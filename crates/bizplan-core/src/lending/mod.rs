pub mod amortization;
pub mod assessment;
