mod byte_order_tests;
mod roundtrip_tests;
