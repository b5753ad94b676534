fn main() {
    // Service URL defaults are baked in with option_env!; rebuild when they change.
    println!("cargo:rerun-if-env-changed=MIUNLOCK_ACCOUNT_URL");
    println!("cargo:rerun-if-env-changed=MIUNLOCK_UNLOCK_API_URL");
}
