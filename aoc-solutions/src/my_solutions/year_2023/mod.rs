pub mod day_21;
