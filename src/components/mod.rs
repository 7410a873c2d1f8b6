pub mod schedule_table;
