pub mod ledger;
pub mod requests;
