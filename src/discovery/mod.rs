mod reviews;

pub use reviews::collect_reviews;
