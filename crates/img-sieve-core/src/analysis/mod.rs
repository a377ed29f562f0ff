pub mod reconcile;
pub mod size_check;
