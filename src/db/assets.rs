use crate::config::S3Config;
use crate::db::errors::S3Error;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::{Builder as S3ConfigBuilder, Credentials};
use aws_sdk_s3::presigning::PresigningConfig;
use std::time::Duration;

/// Presigned access to the image bucket. Keys follow `restaurants/{id}` and
/// `avatars/{id}`; see [`crate::traits::ImageKey`].
#[derive(Clone)]
pub struct AssetOperations {
    client: aws_sdk_s3::Client,
    bucket_name: String,
    upload_ttl: Duration,
    download_ttl: Duration,
}

impl AssetOperations {
    pub async fn new(cfg: &S3Config) -> Result<Self, S3Error> {
        if cfg.bucket_name.trim().is_empty() {
            return Err(S3Error::Config("bucket name is empty".to_string()));
        }
        let region_provider = RegionProviderChain::first_try(Region::new(cfg.region.clone()));
        let creds = Credentials::new(
            &cfg.access_key_id,
            &cfg.secret_key,
            None,
            None,
            "bizidata-env",
        );

        let shared = aws_config::defaults(BehaviorVersion::latest())
            .credentials_provider(creds)
            .endpoint_url(&cfg.endpoint)
            .region(region_provider)
            .load()
            .await;

        let s3_config = S3ConfigBuilder::from(&shared)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket_name: cfg.bucket_name.clone(),
            upload_ttl: Duration::from_secs(cfg.upload_ttl_secs),
            download_ttl: Duration::from_secs(cfg.download_ttl_secs),
        })
    }

    fn presigning(ttl: Duration) -> Result<PresigningConfig, S3Error> {
        PresigningConfig::expires_in(ttl).map_err(|e| S3Error::Presign(e.to_string()))
    }

    /// URL the dashboard PUTs the image bytes to.
    pub async fn presign_upload(&self, key: &str) -> Result<String, S3Error> {
        let request = self
            .client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .presigned(Self::presigning(self.upload_ttl)?)
            .await
            .map_err(|e| S3Error::Presign(e.to_string()))?;
        Ok(request.uri().to_string())
    }

    pub async fn presign_download(&self, key: &str) -> Result<String, S3Error> {
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .presigned(Self::presigning(self.download_ttl)?)
            .await
            .map_err(|e| S3Error::Presign(e.to_string()))?;
        Ok(request.uri().to_string())
    }

    pub async fn delete_object(&self, key: &str) -> Result<(), S3Error> {
        self.client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                debug!("failed to delete object '{}': {:?}", key, e);
                S3Error::Operation(e.to_string())
            })?;
        Ok(())
    }
}
