fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Compile the proto file for the embedding service client. If `protoc`
    // is not installed, fall back to the pre-generated code checked in under
    // proto_gen/ so the crate still builds offline.
    match tonic_build::compile_protos("../../proto/embeddings.proto") {
        Ok(()) => {}
        Err(e) if e.to_string().contains("protoc") => {
            let out_dir = std::env::var("OUT_DIR")?;
            std::fs::copy(
                "proto_gen/embeddings.rs",
                std::path::Path::new(&out_dir).join("embeddings.rs"),
            )?;
            println!("cargo:rerun-if-changed=proto_gen/embeddings.rs");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
