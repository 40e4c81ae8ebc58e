pub mod observers;
