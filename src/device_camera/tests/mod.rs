mod snapshot_test;
