mod config_test;
mod git_ref_test;
mod graph_test;
mod tree_test;
