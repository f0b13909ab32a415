mod booking_test;
mod test_utils;
