mod post_test;
