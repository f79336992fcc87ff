//! Command handlers for the roamd binary.

use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use log::info;

use roamd_core::clock::SystemClock;
use roamd_core::modes::ScanModeManager;
use roamd_core::modes::scan::ModeManager;
use roamd_core::provider::{MemoryKeyStore, RealmConfig, RealmProvider};
use roamd_core::store::{
    MemoryProviderSource, ProviderDataSource, ProviderStoreData, StoreManager,
};

type CliResult = Result<(), Box<dyn Error>>;

/// Build a store manager over `dir` with the provider dataset registered,
/// returning the data source alongside it.
fn open_store(dir: &Path) -> (StoreManager, Arc<Mutex<MemoryProviderSource>>) {
    let source = Arc::new(Mutex::new(MemoryProviderSource::new()));
    let data = ProviderStoreData::new(
        source.clone(),
        Arc::new(MemoryKeyStore::new()),
        Arc::new(SystemClock::new()),
    );
    let mut manager = StoreManager::new(dir.to_path_buf());
    manager.register(Arc::new(data));
    (manager, source)
}

fn providers_in(source: &Arc<Mutex<MemoryProviderSource>>) -> Vec<RealmProvider> {
    source
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .get_providers()
}

pub fn check(dir: &Path) -> CliResult {
    let (manager, source) = open_store(dir);
    manager.read()?;
    println!(
        "store ok: {} provider(s) in {}",
        providers_in(&source).len(),
        dir.display()
    );
    Ok(())
}

pub fn show(dir: &Path) -> CliResult {
    let (manager, source) = open_store(dir);
    manager.read()?;
    let providers = providers_in(&source);
    if providers.is_empty() {
        println!("no providers");
        return Ok(());
    }
    for provider in providers {
        println!(
            "provider {}: fqdn={} creator_uid={} suggestion={} trusted={} connected={}",
            provider.provider_id(),
            provider.config().home_fqdn,
            provider.creator_uid(),
            provider.is_from_suggestion(),
            provider.is_trusted(),
            provider.has_ever_connected(),
        );
    }
    Ok(())
}

pub fn validate_profile(file: &Path) -> CliResult {
    let json = fs::read_to_string(file)?;
    let config = RealmConfig::from_provisioning_json(&json)?;
    println!("profile ok: {}", config.home_fqdn);
    Ok(())
}

pub async fn run(dir: &Path) -> CliResult {
    let (manager, source) = open_store(dir);
    manager.read()?;
    info!("loaded {} provider(s)", providers_in(&source).len());

    let mode = ScanModeManager::new();
    mode.start().await;
    mode.process_queue().await;
    println!("scan mode: {}", mode.current_state().await);

    mode.stop().await;
    mode.process_queue().await;
    println!("scan mode: {}", mode.current_state().await);

    manager.write()?;
    Ok(())
}
