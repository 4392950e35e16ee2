pub mod installer_client_reqwest;
