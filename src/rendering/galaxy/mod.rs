pub mod galaxy;
