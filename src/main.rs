use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    cameo::cli::main()
}
