pub mod text_table;
