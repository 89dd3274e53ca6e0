use rrbench::error::AppResult;

fn main() -> AppResult<()> {
    rrbench::run()
}
