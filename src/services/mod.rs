pub mod assembler;
pub mod assistant;
pub mod chatbot;
pub mod climate;
pub mod geocode;
pub mod heat;
pub mod insights;
pub mod openweather;
pub mod probability;
pub mod seed;
