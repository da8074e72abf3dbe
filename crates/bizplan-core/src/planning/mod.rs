pub mod financial_plan;
