pub mod invoice;
pub mod swagger_main;
#[cfg(test)]
pub mod test_util;
pub mod user;
