pub mod std;
pub mod wyhash;

#[cfg(test)]
mod tests;
