mod counter;

pub use counter::KeywordCounter;
