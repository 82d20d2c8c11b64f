/// CSV export of labelled queries.
pub mod export;
/// Seeded synthetic query generation and labelling.
pub mod generator;
