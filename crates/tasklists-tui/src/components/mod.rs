pub mod list_board;
