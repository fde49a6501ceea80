fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
