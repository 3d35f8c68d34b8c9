mod extractors_test;
mod guards_test;
