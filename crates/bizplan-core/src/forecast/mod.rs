pub mod products;
pub mod profitability;
pub mod projection;
pub mod seasonality;
