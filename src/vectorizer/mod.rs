pub mod token;
pub mod vocabulary;
pub mod matrix;
pub mod evaluate;
