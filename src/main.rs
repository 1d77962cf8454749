fn main() -> anyhow::Result<()> {
    trafficwatch_lib::run()
}
