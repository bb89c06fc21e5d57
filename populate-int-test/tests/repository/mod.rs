mod repository_populate_test;
