fn main() {
    carmine::cli::run();
}
