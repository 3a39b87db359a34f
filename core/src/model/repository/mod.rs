pub mod db;
pub mod db_entity;
pub mod post;
#[cfg(test)]
mod test;
