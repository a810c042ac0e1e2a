pub mod value;
pub mod observers;
