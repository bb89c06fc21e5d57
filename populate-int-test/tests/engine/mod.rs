mod chain_test;
mod concurrency_test;
mod error_test;
mod plural_hop_test;
mod single_hop_test;
