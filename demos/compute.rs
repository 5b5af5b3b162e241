//! Submits a batch of value-returning tasks and reads every result back
//! through its handle.

use taskpool::{Result, ThreadPool};

fn main() -> Result<()> {
    env_logger::init();

    let pool = ThreadPool::with_default_workers()?;

    let squares: Vec<_> = (0..10)
        .map(|i: u64| pool.submit(move || i * i))
        .collect::<Result<_>>()?;

    let greetings: Vec<_> = ["hello", "bonjour", "hallo"]
        .into_iter()
        .map(|word| pool.submit(move || format!("{word}, world")))
        .collect::<Result<_>>()?;

    for (i, handle) in squares.iter().enumerate() {
        println!("{i}^2 = {}", handle.wait()?);
    }
    for handle in &greetings {
        println!("{}", handle.wait()?);
    }

    Ok(())
}
