fn main() -> anyhow::Result<()> {
    compiler_bx_backend::driver::driver_main()
}
