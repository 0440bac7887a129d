pub mod shadow_pass;
