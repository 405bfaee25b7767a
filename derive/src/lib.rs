use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{
    Attribute, Data, DeriveInput, Field, Fields, FieldsNamed, GenericParam, Generics, Ident,
    LitStr, Visibility, parse_macro_input, parse_quote,
};

/// Derive macro implementing `copier::Decodable` and `copier::StructFields`.
///
/// Field attributes:
///
/// - `#[tag(json = "key", yaml = "other")]`: lookup key per tag namespace.
///   `"-"` hides the field in that namespace. Untagged `pub` fields use their
///   name; untagged private fields cannot be targeted, and tagged private
///   fields fail with `NotSettable` when the source has a value for them.
/// - `#[copier(embed)]`: promote the field's own fields (the field type must
///   implement `StructFields`). The field's own key, if any, is decoded into
///   the whole embedded value after the promoted fields.
/// - `#[copier(skip)]`: leave the field out entirely.
///
/// Container attributes:
///
/// - `#[copier(copy_in)]`: the type implements `copier::CopyIn`, which is
///   tried before the field rules.
///
/// # Example
///
/// ```ignore
/// #[derive(Default, Decodable)]
/// pub struct Server {
///     #[copier(embed)]
///     base: Base,
///     #[tag(json = "addr", yaml = "address")]
///     pub addr: String,
///     pub port: u16,
/// }
/// ```
#[proc_macro_derive(Decodable, attributes(copier, tag))]
pub fn derive_decodable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match decodable_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// Derive macro implementing `copier::Encodable` and `copier::EncodeFields`,
/// with the same attributes and key resolution as `Decodable`. Only `pub`
/// fields are written; embedded fields are written through their promoted
/// fields.
#[proc_macro_derive(Encodable, attributes(copier, tag))]
pub fn derive_encodable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match encodable_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

#[derive(Default)]
struct ContainerAttrs {
    copy_in: bool,
}

struct FieldInfo {
    ident: Ident,
    name: String,
    exported: bool,
    tags: Vec<(String, String)>,
    embed: bool,
    skip: bool,
}

impl FieldInfo {
    /// Whether some namespace can resolve a key for this field.
    fn addressable(&self) -> bool {
        self.exported || !self.tags.is_empty()
    }

    fn descriptor(&self) -> TokenStream2 {
        let name = &self.name;
        let exported = self.exported;
        let tags = self.tags.iter().map(|(ns, key)| quote! { (#ns, #key) });
        quote! {
            ::copier::FieldDescriptor {
                name: #name,
                exported: #exported,
                tags: &[#(#tags),*],
            }
        }
    }
}

fn decodable_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let container = container_attrs(&input.attrs)?;
    let fields = field_infos(named_fields(input, "Decodable")?)?;
    let generics = bounded(
        &input.generics,
        quote! { ::copier::Decodable + ::core::default::Default },
    );
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let bound: Vec<&FieldInfo> = fields.iter().filter(|f| !f.skip).collect();
    let idents = bound.iter().map(|f| &f.ident);
    let binds = bound.iter().map(|f| {
        let ident = &f.ident;
        if f.embed {
            quote! {
                ::copier::StructFields::bind_fields(#ident, __tag, __table);
            }
        } else {
            let descriptor = f.descriptor();
            quote! {
                __table.bind(&#descriptor, __tag, #ident);
            }
        }
    });

    let embedded = bound.iter().filter(|f| f.embed).map(|f| {
        let ident = &f.ident;
        let own_key = f.addressable().then(|| {
            let descriptor = f.descriptor();
            quote! {
                __cx.decode_field(__entries, &#descriptor, &mut self.#ident)?;
            }
        });
        quote! {
            ::copier::StructFields::decode_embedded(&mut self.#ident, __entries, __cx)?;
            #own_key
        }
    });

    let hook = container.copy_in.then(|| {
        quote! {
            fn hook(&mut self) -> ::copier::Hook<'_> {
                ::copier::Hook::Custom(self)
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::copier::StructFields for #name #ty_generics #where_clause {
            fn bind_fields<'__copier>(
                &'__copier mut self,
                __tag: &str,
                __table: &mut ::copier::FieldTable<'__copier>,
            ) {
                let Self { #(#idents,)* .. } = self;
                #(#binds)*
            }

            fn decode_embedded(
                &mut self,
                __entries: &::copier::Map,
                __cx: &mut ::copier::Context<'_>,
            ) -> ::copier::Result<()> {
                #(#embedded)*
                ::core::result::Result::Ok(())
            }
        }

        impl #impl_generics ::copier::Decodable for #name #ty_generics #where_clause {
            fn kind() -> ::copier::Kind {
                ::copier::Kind::Struct
            }

            #hook

            fn decode_generic(
                &mut self,
                __src: &::copier::Value,
                __cx: &mut ::copier::Context<'_>,
            ) -> ::copier::Result<()> {
                __cx.decode_struct(__src, self)
            }
        }
    })
}

fn encodable_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    container_attrs(&input.attrs)?;
    let fields = field_infos(named_fields(input, "Encodable")?)?;
    let generics = bounded(&input.generics, quote! { ::copier::Encodable });
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let written = fields.iter().filter(|f| !f.skip && (f.embed || f.exported));
    let writes = written.map(|f| {
        let ident = &f.ident;
        if f.embed {
            quote! {
                ::copier::EncodeFields::encode_fields(&self.#ident, __tag, __out);
            }
        } else {
            let descriptor = f.descriptor();
            quote! {
                if let ::core::option::Option::Some(__key) = (#descriptor).key(__tag) {
                    __out.insert(
                        ::std::string::String::from(__key),
                        ::copier::Encodable::to_value(&self.#ident, __tag),
                    );
                }
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::copier::EncodeFields for #name #ty_generics #where_clause {
            fn encode_fields(&self, __tag: &str, __out: &mut ::copier::Map) {
                #(#writes)*
            }
        }

        impl #impl_generics ::copier::Encodable for #name #ty_generics #where_clause {
            fn to_value(&self, tag: &str) -> ::copier::Value {
                let mut out = ::copier::Map::new();
                ::copier::EncodeFields::encode_fields(self, tag, &mut out);
                ::copier::Value::Object(out)
            }
        }
    })
}

/// Adds `T: #bound` for every type parameter.
fn bounded(generics: &Generics, bound: TokenStream2) -> Generics {
    let mut generics = generics.clone();
    let params: Vec<Ident> = generics
        .params
        .iter()
        .filter_map(|param| match param {
            GenericParam::Type(ty) => Some(ty.ident.clone()),
            _ => None,
        })
        .collect();
    let where_clause = generics.make_where_clause();
    for param in params {
        where_clause.predicates.push(parse_quote! { #param: #bound });
    }
    generics
}

fn named_fields<'a>(input: &'a DeriveInput, derive: &str) -> syn::Result<&'a FieldsNamed> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(fields),
            _ => Err(syn::Error::new_spanned(
                &input.ident,
                format!("{derive} only supports structs with named fields"),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            &input.ident,
            format!("{derive} only supports structs"),
        )),
    }
}

fn container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
    let mut out = ContainerAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("copier") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("copy_in") {
                out.copy_in = true;
                Ok(())
            } else {
                Err(meta.error("unknown copier container attribute (expected `copy_in`)"))
            }
        })?;
    }
    Ok(out)
}

fn field_infos(fields: &FieldsNamed) -> syn::Result<Vec<FieldInfo>> {
    fields.named.iter().map(field_info).collect()
}

fn field_info(field: &Field) -> syn::Result<FieldInfo> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;

    let mut info = FieldInfo {
        name: ident.unraw().to_string(),
        ident,
        exported: matches!(field.vis, Visibility::Public(_)),
        tags: Vec::new(),
        embed: false,
        skip: false,
    };

    for attr in &field.attrs {
        if attr.path().is_ident("tag") {
            attr.parse_nested_meta(|meta| {
                let namespace = meta
                    .path
                    .get_ident()
                    .ok_or_else(|| meta.error("expected a tag namespace such as `json`"))?
                    .unraw()
                    .to_string();
                if info.tags.iter().any(|(ns, _)| *ns == namespace) {
                    return Err(meta.error(format!("duplicate tag namespace `{namespace}`")));
                }
                let key: LitStr = meta.value()?.parse()?;
                info.tags.push((namespace, key.value()));
                Ok(())
            })?;
        } else if attr.path().is_ident("copier") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("embed") {
                    info.embed = true;
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    info.skip = true;
                    Ok(())
                } else {
                    Err(meta.error("unknown copier field attribute (expected `embed` or `skip`)"))
                }
            })?;
        }
    }

    Ok(info)
}
