fn main() {
    std::process::exit(renam_lib::run());
}
