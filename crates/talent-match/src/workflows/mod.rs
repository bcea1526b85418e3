pub mod applications;
pub mod candidates;
pub mod catalog;
pub mod matching;
pub mod opportunities;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;
