mod consistency_queries;

pub use consistency_queries::ConsistencyQueries;
