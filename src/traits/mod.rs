mod rolling;

pub use rolling::Rolling;
