pub mod candle;
pub mod candle_series;
pub mod order_book;
pub mod point;
pub mod timeframe;
