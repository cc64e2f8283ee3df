/// Player state and highscore storage backends.
pub mod game_store;
/// Storage entity definitions.
pub mod models;
/// Storage abstraction layer for database operations.
pub mod storage;
