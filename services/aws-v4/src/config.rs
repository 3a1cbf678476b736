// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt::{Debug, Formatter};

use apisign_core::utils::Redact;
use apisign_core::{Env, Error, Result};
use log::debug;

use crate::constants::*;
use crate::{Credential, SigningContext};

/// Config for aws services.
///
/// Fields left as `None` can be filled from the environment with
/// [`Config::from_env`]; values set explicitly always win.
#[derive(Clone, Default)]
pub struct Config {
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_ACCESS_KEY_ID`
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_SECRET_ACCESS_KEY`
    pub secret_access_key: Option<String>,
    /// `region` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_REGION`
    /// - env value: `AWS_DEFAULT_REGION`
    pub region: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("region", &self.region)
            .finish()
    }
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self, env: &impl Env) -> Self {
        let var = |key: &str| env.var(key).filter(|v| !v.is_empty());

        if self.access_key_id.is_none() {
            self.access_key_id = var(AWS_ACCESS_KEY_ID);
        }
        if self.secret_access_key.is_none() {
            self.secret_access_key = var(AWS_SECRET_ACCESS_KEY);
        }
        if self.region.is_none() {
            self.region = var(AWS_REGION).or_else(|| var(AWS_DEFAULT_REGION));
        }

        debug!("config loaded from env: {self:?}");
        self
    }

    /// Build a signing context for `service`, signing at the current time.
    pub fn signing_context(&self, service: &str) -> Result<SigningContext> {
        let region = self
            .region
            .as_deref()
            .ok_or_else(|| Error::missing_argument("region is not configured"))?;
        let access_key_id = self
            .access_key_id
            .as_deref()
            .ok_or_else(|| Error::missing_argument("access_key_id is not configured"))?;
        let secret_access_key = self
            .secret_access_key
            .as_deref()
            .ok_or_else(|| Error::missing_argument("secret_access_key is not configured"))?;

        Ok(SigningContext::new(
            service,
            region,
            Credential::new(access_key_id, secret_access_key),
        ))
    }
}
