pub mod subnews;
