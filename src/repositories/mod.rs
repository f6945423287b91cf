pub mod route_repository;

#[cfg(test)]
pub mod in_memory_route_repository;
