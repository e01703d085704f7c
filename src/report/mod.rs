pub mod index_txt;
