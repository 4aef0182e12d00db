pub mod ftpr;
