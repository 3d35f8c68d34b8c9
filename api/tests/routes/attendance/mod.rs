mod put_test;
