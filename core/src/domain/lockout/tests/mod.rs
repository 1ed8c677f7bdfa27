mod record_tests;
