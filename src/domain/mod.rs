pub mod assignment;
pub mod invoice;
pub mod user;

#[cfg(test)]
pub mod test_util;
