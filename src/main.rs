fn main() {
    sc_log_parser_lib::run()
}
