fn main() {
    uniffi::generate_scaffolding("src/fishcount.udl").unwrap();
}
